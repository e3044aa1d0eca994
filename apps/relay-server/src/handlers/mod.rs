//! HTTP handlers and route configuration.

mod health;
mod relay;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::resource("/relay")
                    .route(web::get().to(relay::liveness))
                    .route(web::post().to(relay::relay))
                    .default_service(web::to(relay::method_not_allowed)),
            ),
    );
}
