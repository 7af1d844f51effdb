//! Built-in controllers.

pub mod echo;
pub mod orders;

pub use echo::EchoController;
pub use orders::OrdersController;
