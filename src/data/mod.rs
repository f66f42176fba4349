pub(crate) mod diet;
