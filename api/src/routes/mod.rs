pub mod chat {
    pub mod chat_route;
}
pub mod embed {
    pub mod embed_request;
    pub mod embed_route;
}
pub mod health_route;
pub mod ingest {
    pub mod ingest_route;
}
pub mod search {
    pub mod search_request;
    pub mod search_route;
}
