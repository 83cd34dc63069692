// Dog profiles. Every query is scoped by the owning user's id.

pub mod handlers;
pub mod store;
