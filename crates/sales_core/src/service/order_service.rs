//! Async order service.
//!
//! # Responsibility
//! - Offer the order repository operations as `async fn`s.
//! - Keep blocking SQLite work off the async executor.
//!
//! # Invariants
//! - One service call runs exactly one repository operation on tokio's
//!   blocking pool; statements inside it stay strictly sequential.
//! - Dropping a returned future does not cancel the storage work already
//!   started on the blocking pool.

use crate::model::order::{Order, OrderId};
use crate::repo::error::RepoError;
use crate::repo::order_repo::OrderRepository;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type OrderServiceResult<T> = Result<T, OrderServiceError>;

/// Errors surfaced by `OrderService`.
#[derive(Debug)]
pub enum OrderServiceError {
    /// Repository-level failure, unchanged.
    Repo(RepoError),
    /// The blocking worker panicked or was cancelled by runtime shutdown.
    Worker(String),
}

impl Display for OrderServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Worker(message) => write!(f, "order worker failed: {message}"),
        }
    }
}

impl Error for OrderServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Worker(_) => None,
        }
    }
}

impl From<RepoError> for OrderServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Async wrapper over an `OrderRepository`.
pub struct OrderService<R> {
    repo: Arc<R>,
}

impl<R> Clone for OrderService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> OrderService<R>
where
    R: OrderRepository + Send + Sync + 'static,
{
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    pub async fn add_order(&self, order: Order) -> OrderServiceResult<OrderId> {
        self.run(move |repo| repo.add_order(&order)).await
    }

    pub async fn get_order(&self, id: OrderId) -> OrderServiceResult<Order> {
        self.run(move |repo| repo.get_order(id)).await
    }

    pub async fn get_orders(&self, skip: i64, count: i64) -> OrderServiceResult<Vec<Order>> {
        self.run(move |repo| repo.get_orders(skip, count)).await
    }

    pub async fn update_order(&self, order: Order) -> OrderServiceResult<()> {
        self.run(move |repo| repo.update_order(&order)).await
    }

    pub async fn remove_order(&self, id: OrderId) -> OrderServiceResult<()> {
        self.run(move |repo| repo.remove_order(id)).await
    }

    async fn run<T, F>(&self, call: F) -> OrderServiceResult<T>
    where
        F: FnOnce(&R) -> Result<T, RepoError> + Send + 'static,
        T: Send + 'static,
    {
        let repo = Arc::clone(&self.repo);
        match tokio::task::spawn_blocking(move || call(repo.as_ref())).await {
            Ok(result) => result.map_err(OrderServiceError::from),
            Err(join_err) => Err(OrderServiceError::Worker(join_err.to_string())),
        }
    }
}
