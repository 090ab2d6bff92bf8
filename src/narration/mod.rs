pub(crate) mod bookmarks;
pub(crate) mod speech;
