pub mod fit;
pub mod serve;

pub use fit::handle_fit;
pub use serve::handle_serve;
