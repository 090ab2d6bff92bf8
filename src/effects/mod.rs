pub(crate) mod effect;
pub(crate) mod library;
pub(crate) mod scheduler;
pub(crate) mod transition;
