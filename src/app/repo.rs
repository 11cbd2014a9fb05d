/// Postgres implementations of the repository traits.
pub mod pg;
