pub mod submissions;

pub use submissions::PgDatastore;
