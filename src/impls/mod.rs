mod fm_service;

pub(crate) use fm_service::FmService;
