mod on_disk;

pub(crate) use on_disk::OnDiskStorage;
