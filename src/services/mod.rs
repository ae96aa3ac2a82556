pub mod budget_service;
pub mod catalog_service;
pub mod chat_service;
pub mod extraction_service;
pub mod gemini_service;
pub mod intent_service;
pub mod storage_service;
