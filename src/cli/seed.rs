use docrepo::DocumentId;
use docrepo::models::{Product, Review, User};

pub fn users() -> Vec<User> {
    vec![
        User::new("john_doe", "hashed_password", "john.doe@example.com"),
        User::new("jane_smith", "hashed_password", "jane.smith@example.com"),
    ]
}

/// Sample products reviewed by `reviewers`.
pub fn products(reviewers: &[User]) -> Vec<Product> {
    let reviewer = |index: usize| {
        reviewers
            .get(index)
            .map(|u| (u.id, u.user_name.clone()))
            .unwrap_or((DocumentId::nil(), String::new()))
    };
    let (first_id, first_name) = reviewer(0);
    let (second_id, second_name) = reviewer(1);

    vec![
        Product::new("Sample Product 1", 19.99, 50)
            .with_description("This is a sample product description.")
            .with_review(Review::new(first_id, 5, "Great product!").with_extra("username", first_name.clone()))
            .with_review(
                Review::new(second_id, 3, "Not bad, could be better.")
                    .with_extra("username", second_name.clone()),
            ),
        Product::new("Sample Product 2", 29.99, 30)
            .with_description("Another sample product.")
            .with_review(
                Review::new(second_id, 4, "Pretty good value.").with_extra("username", second_name),
            ),
        Product::new("Sample Product 3", 9.99, 0).with_review(
            Review::new(first_id, 2, "Arrived late.").with_extra("username", first_name),
        ),
    ]
}
