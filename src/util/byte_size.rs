pub(crate) const KIB: u64 = 1024;
