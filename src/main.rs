#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    casegen_lib::run().await
}
