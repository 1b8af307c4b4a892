use super::error::{Error, ErrorKind, ResultStateError};

/// Outcome of a repository call.
///
/// Either a success carrying an optional value and `Error::none()`, or a
/// failure carrying a real error and no value. The two are never mixed:
/// the infallible constructors cannot build a mixed state and `from_parts`
/// rejects one.
///
/// Callers branch on `is_success`/`is_failure` before touching the value.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct RepoResult<T> {
    is_success: bool,
    error: Error,
    value: Option<T>,
}

impl<T> RepoResult<T> {
    pub fn success(value: T) -> Self {
        Self {
            is_success: true,
            error: Error::none(),
            value: Some(value),
        }
    }

    /// Success with no value, for unit-like operations.
    pub fn success_empty() -> Self {
        Self {
            is_success: true,
            error: Error::none(),
            value: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            error: Error::new(kind, message),
            value: None,
        }
    }

    /// Failure from an existing error value; rejects the sentinel.
    pub fn try_failure(error: Error) -> Result<Self, ResultStateError> {
        Self::from_parts(false, error, None)
    }

    /// Checked constructor from raw parts.
    ///
    /// A failure never keeps a value, even if one is supplied.
    pub fn from_parts(
        is_success: bool,
        error: Error,
        value: Option<T>,
    ) -> Result<Self, ResultStateError> {
        match (is_success, error.is_none()) {
            (true, false) => Err(ResultStateError::SuccessWithError(error)),
            (false, true) => Err(ResultStateError::FailureWithoutError),
            (true, true) => Ok(Self {
                is_success,
                error,
                value,
            }),
            (false, false) => Ok(Self {
                is_success,
                error,
                value: None,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Convert into a std `Result` for use with `?`.
    pub fn into_result(self) -> Result<Option<T>, Error> {
        if self.is_success {
            Ok(self.value)
        } else {
            Err(self.error)
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RepoResult<U> {
        RepoResult {
            is_success: self.is_success,
            error: self.error,
            value: self.value.map(f),
        }
    }
}

impl<T> From<Error> for RepoResult<T> {
    /// The sentinel converts to an empty success.
    fn from(error: Error) -> Self {
        if error.is_none() {
            Self::success_empty()
        } else {
            Self {
                is_success: false,
                error,
                value: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_carries_value_and_no_error() {
        for v in [0, 1, -7, i64::MAX] {
            let r = RepoResult::success(v);
            assert!(r.is_success());
            assert!(!r.is_failure());
            assert_eq!(r.error(), &Error::none());
            assert_eq!(r.value(), Some(&v));
        }
    }

    #[test]
    fn test_success_empty() {
        let r: RepoResult<String> = RepoResult::success_empty();
        assert!(r.is_success());
        assert!(r.value().is_none());
        assert_eq!(r.into_result(), Ok(None));
    }

    #[test]
    fn test_failure_carries_error() {
        let r: RepoResult<u32> = RepoResult::failure(ErrorKind::DeleteEntityError, "boom");
        assert!(r.is_failure());
        assert!(!r.is_success());
        assert_eq!(r.error().kind(), Some(ErrorKind::DeleteEntityError));
        assert_eq!(r.error().message(), "boom");
        assert!(r.value().is_none());
    }

    #[test]
    fn test_success_with_error_is_rejected() {
        let err = Error::new(ErrorKind::CreateEntityError, "x");
        let r = RepoResult::from_parts(true, err.clone(), Some(1));
        assert_eq!(r, Err(ResultStateError::SuccessWithError(err)));
    }

    #[test]
    fn test_failure_without_error_is_rejected() {
        let r = RepoResult::<i32>::from_parts(false, Error::none(), None);
        assert_eq!(r, Err(ResultStateError::FailureWithoutError));
        assert_eq!(
            RepoResult::<i32>::try_failure(Error::none()),
            Err(ResultStateError::FailureWithoutError)
        );
    }

    #[test]
    fn test_from_parts_drops_value_on_failure() {
        let err = Error::new(ErrorKind::UpdateEntityError, "x");
        let r = RepoResult::from_parts(false, err, Some(5)).unwrap();
        assert!(r.is_failure());
        assert!(r.value().is_none());
    }

    #[test]
    fn test_none_equals_only_itself() {
        assert_eq!(Error::none(), Error::none());
        assert_ne!(Error::none(), Error::new(ErrorKind::EntityIsNull, ""));
        assert_eq!(Error::none().code(), "");
    }

    #[test]
    fn test_map_and_into_result() {
        let r = RepoResult::success(2).map(|v| v * 10);
        assert_eq!(r.into_result(), Ok(Some(20)));

        let f: RepoResult<i32> = RepoResult::failure(ErrorKind::GetAllEntitiesError, "down");
        let err = f.map(|v| v + 1).into_result().unwrap_err();
        assert_eq!(err.to_string(), "GetAllEntitiesError: down");
    }

    #[test]
    fn test_from_error() {
        let r: RepoResult<()> = Error::none().into();
        assert!(r.is_success());
        let r: RepoResult<()> = Error::new(ErrorKind::EntitiesIsNull, "null").into();
        assert!(r.is_failure());
    }
}
