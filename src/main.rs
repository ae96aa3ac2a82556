use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use buenavista_api::routes;
use buenavista_api::routes::chat::ChatState;
use buenavista_api::services::catalog_service::SupabaseReferenceService;
use buenavista_api::services::chat_service::ChatOrchestrator;
use buenavista_api::services::gemini_service::GeminiService;
use buenavista_api::services::storage_service::ImageUrlResolver;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    // A missing Gemini key leaves the chat route answering 500 instead of
    // taking the whole server down; everything else still serves.
    let orchestrator = match GeminiService::new() {
        Ok(model) => {
            let reference = SupabaseReferenceService::new().unwrap_or_else(|err| {
                eprintln!(
                    "Spot catalog not configured: {}. Chat will run without reference context.",
                    err
                );
                SupabaseReferenceService::with_credentials("", "")
            });
            Some(ChatOrchestrator::new(
                model,
                reference,
                ImageUrlResolver::from_env(),
            ))
        }
        Err(err) => {
            eprintln!("Model client not configured: {}", err);
            None
        }
    };

    let state = web::Data::new(ChatState { orchestrator });

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .route("/health", web::get().to(|| async { "OK" }))
            .app_data(state.clone())
            .service(web::scope("/api").route(
                "/chat",
                web::post().to(routes::chat::chat::<GeminiService, SupabaseReferenceService>),
            ))
    })
    .bind((host, port))?
    .run()
    .await
}
