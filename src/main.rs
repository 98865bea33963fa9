#[actix_web::main]
async fn main() -> std::io::Result<()> {
    maintenance_report_server::run().await
}
