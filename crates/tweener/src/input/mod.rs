pub mod binding;
pub mod queue;
