pub(crate) mod rolling;
