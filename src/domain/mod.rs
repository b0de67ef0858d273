mod account;
mod error;
mod money;
mod mortgage;
mod transaction;
mod user;

pub use account::*;
pub use error::*;
pub use money::*;
pub use mortgage::*;
pub use transaction::*;
pub use user::*;
