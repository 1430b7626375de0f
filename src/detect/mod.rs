pub(crate) mod flash;
