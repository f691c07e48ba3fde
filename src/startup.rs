use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::{dev::Server, http::header, web, App, HttpServer};
use anyhow::Context;
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use tracing_actix_web::TracingLogger;

use crate::{
    auth::jwt::Tokenizer,
    configuration::Settings,
    routes::{
        authentication::{login, register},
        health_check,
        products::{delete_product, get_products, post_product, update_product},
        restocks::{get_restocks, post_restock},
        suppliers::{get_suppliers, post_supplier},
        users::{delete_user, get_users}
    },
    utils::DbPool
};

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let pool = get_connection_pool(&settings);

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))
            .context("Failed to bind application address")?;
        let port = listener.local_addr()
            .context("Failed to read bound address")?
            .port();

        let pool = web::Data::new(pool);
        let tokenizer = web::Data::new(Tokenizer::new(&settings.jwt));
        let allowed_origins = settings.cors.allowed_origins;

        let server = HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }

            App::new()
                .wrap(TracingLogger::default())
                .wrap(cors)
                .route("/health", web::get().to(health_check))
                .route("/register", web::post().to(register))
                .route("/login", web::post().to(login))
                .service(
                    web::scope("/products")
                        .route("", web::get().to(get_products))
                        .route("", web::post().to(post_product))
                        .route("/update", web::post().to(update_product))
                        .route("/delete", web::post().to(delete_product))
                )
                .service(
                    web::scope("/users")
                        .route("", web::get().to(get_users))
                        .route("/delete", web::post().to(delete_user))
                )
                .service(
                    web::scope("/suppliers")
                        .route("", web::get().to(get_suppliers))
                        .route("", web::post().to(post_supplier))
                )
                .service(
                    web::scope("/restocks")
                        .route("", web::get().to(get_restocks))
                        .route("", web::post().to(post_restock))
                )
                .app_data(pool.clone())
                .app_data(tokenizer.clone())
        })
        .listen(listener)
        .context("Failed to start http server")?
        .run();

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }
}

pub fn get_connection_pool(settings: &Settings) -> DbPool{
    let manager = ConnectionManager::<PgConnection>::new(settings.database.get_database_table_url());

    // max_size stays at the r2d2 default; connections are established lazily
    Pool::builder()
        .build_unchecked(manager)
}
