use super::{Step, seed};
use docrepo::models::{Product, Review, User};
use docrepo::repository::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use docrepo::{
    CollectionBindings, GenericRepository, InMemoryStore, RepoResult, Repository, StoreConfig,
    StoreError, StoreOp, array_field,
};
use std::sync::Arc;

pub struct App {
    store: Arc<InMemoryStore>,
    users: GenericRepository<User>,
    products: GenericRepository<Product>,
}

impl App {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let bindings = if config.collections.is_empty() {
            CollectionBindings::new()
                .with::<User>("users")?
                .with::<Product>("products")?
        } else {
            config.bindings()?
        };

        let store = InMemoryStore::with_config(config);
        Ok(Self {
            users: GenericRepository::new(store.clone(), &bindings)?,
            products: GenericRepository::new(store.clone(), &bindings)?,
            store,
        })
    }

    /// Create a user and a product reviewed by them, then push a second
    /// review, all inside one transaction. Commits only if every step
    /// succeeded. Returns whether the transaction was committed.
    pub async fn run_transaction(&self, fail_step: Option<Step>) -> Result<bool, StoreError> {
        let user = User::new("kola_hola", "hashed_password", "kola_hola@example.com");
        let product = Product::new("Sample Product 3", 19.99, 50)
            .with_description("This is a sample product description.")
            .with_review(Review::new(user.id, 4, "Great product!").with_extra("username", "kola_hola"));
        let new_review =
            Review::new(user.id, 5, "Awesome product!").with_extra("username", "kola_hola");

        let mut session = self.store.start_session();
        session.start_transaction()?;

        self.inject(fail_step, Step::CreateUser);
        let user_result = self.users.create(&user, Some(&session)).await;

        self.inject(fail_step, Step::CreateProduct);
        let product_result = self.products.create(&product, Some(&session)).await;

        self.inject(fail_step, Step::AddReview);
        let review_result = self
            .products
            .add_subdocument(
                product.id,
                &array_field!(Product, reviews => "reviews"),
                &new_review,
                Some(&session),
            )
            .await;

        report("create user", &user_result);
        report("create product", &product_result);
        report("add review", &review_result);

        let committed = if user_result.is_failure()
            || product_result.is_failure()
            || review_result.is_failure()
        {
            session.abort_transaction().await?;
            false
        } else {
            match session.commit_transaction().await {
                Ok(()) => true,
                Err(err) => {
                    eprintln!("commit failed: {}", err);
                    false
                }
            }
        };

        if committed {
            println!("Successfully committed transaction!");
        } else {
            println!("Transaction aborted!");
        }

        let stored = self.products.get_by_id(product.id, None).await;
        match stored.value() {
            Some(Some(p)) => println!("{} now has {} review(s)", p.name, p.reviews.len()),
            Some(None) => println!("product {} is not stored", product.id),
            None => println!("could not read product back: {}", stored.error()),
        }

        Ok(committed)
    }

    pub async fn seed(&self) -> Result<(), StoreError> {
        let users = seed::users();
        let products = seed::products(&users);

        let user_ids = self.users.insert_many(users.as_slice(), None).await;
        report("insert users", &user_ids);
        let product_ids = self.products.insert_many(products.as_slice(), None).await;
        report("insert products", &product_ids);

        let page = self.products.get_all(DEFAULT_PAGE, DEFAULT_PAGE_SIZE, None).await;
        if let Some(products) = page.value() {
            for product in products {
                println!(
                    "{}  {:<20} {:>8.2}  stock {:>3}  reviews {}",
                    product.id,
                    product.name,
                    product.price,
                    product.stock,
                    product.reviews.len()
                );
            }
        }

        println!(
            "{}: {} users, {} products",
            self.store.database(),
            self.store.count(self.users.collection()).await,
            self.store.count(self.products.collection()).await
        );
        Ok(())
    }

    fn inject(&self, fail_step: Option<Step>, step: Step) {
        if fail_step != Some(step) {
            return;
        }
        let op = match step {
            Step::CreateUser | Step::CreateProduct => StoreOp::InsertOne,
            Step::AddReview => StoreOp::UpdateOne,
        };
        self.store.fail_next(op, "injected failure");
    }
}

fn report<T: std::fmt::Debug>(step: &str, result: &RepoResult<T>) {
    if result.is_success() {
        println!("{:<16} ok     {:?}", step, result.value());
    } else {
        println!("{:<16} failed {}", step, result.error());
    }
}
