pub mod authenticated;

pub use authenticated::AuthenticatedUser;
