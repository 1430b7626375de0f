pub(crate) mod safety_session;
