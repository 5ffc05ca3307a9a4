pub async fn home() -> &'static str {
    "Chamahub"
}
