pub(crate) mod thresholds;
