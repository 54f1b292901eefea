macro_rules! get(
    ($e:expr) => (match $e { Some(e) => e, None => return None })
);
