use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use niaga::config::Config;
use niaga::middleware::RequestId;
use niaga::modules::catalog::controllers::barang_controller;
use niaga::modules::catalog::repositories::BarangRepository;
use niaga::modules::catalog::services::BarangService;
use niaga::modules::debts::controllers::debt_controller;
use niaga::modules::debts::repositories::DebtRepository;
use niaga::modules::debts::services::DebtService;
use niaga::modules::employees::controllers::{karyawan_controller, penggajian_controller};
use niaga::modules::employees::services::{KaryawanService, PenggajianService};
use niaga::modules::expenses::controllers::pengeluaran_controller;
use niaga::modules::expenses::services::PengeluaranService;
use niaga::modules::partners::controllers::partner_controller::{self, PartnerServices};
use niaga::modules::partners::repositories::PartnerRepository;
use niaga::modules::partners::services::PartnerService;
use niaga::modules::purchases::controllers::pembelian_controller;
use niaga::modules::purchases::services::PembelianService;
use niaga::modules::reports::controllers::laporan_controller;
use niaga::modules::reports::services::LaporanService;
use niaga::modules::sales::controllers::penjualan_controller;
use niaga::modules::sales::services::PenjualanService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "niaga=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Niaga trading backend");
    tracing::info!("Environment: {}", config.app.env);

    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized (up to {} connections)",
        config.database.max_connections
    );

    let tempo = config.app.tempo_hutang_hari;

    let barang_service = web::Data::new(Arc::new(BarangService::new(BarangRepository::new(
        db_pool.clone(),
    ))));
    let partner_services = web::Data::new(PartnerServices {
        suppliers: Arc::new(PartnerService::new(PartnerRepository::suppliers(
            db_pool.clone(),
        ))),
        customers: Arc::new(PartnerService::new(PartnerRepository::customers(
            db_pool.clone(),
        ))),
    });
    let debt_service = web::Data::new(Arc::new(DebtService::new(DebtRepository::new(
        db_pool.clone(),
    ))));
    let pembelian_service =
        web::Data::new(Arc::new(PembelianService::new(db_pool.clone(), tempo)));
    let penjualan_service =
        web::Data::new(Arc::new(PenjualanService::new(db_pool.clone(), tempo)));
    let karyawan_service = web::Data::new(Arc::new(KaryawanService::new(db_pool.clone())));
    let penggajian_service = web::Data::new(Arc::new(PenggajianService::new(db_pool.clone())));
    let pengeluaran_service = web::Data::new(Arc::new(PengeluaranService::new(db_pool.clone())));
    let laporan_service = web::Data::new(Arc::new(LaporanService::new(db_pool.clone())));

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .wrap(cors)
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(barang_service.clone())
            .app_data(partner_services.clone())
            .app_data(debt_service.clone())
            .app_data(pembelian_service.clone())
            .app_data(penjualan_service.clone())
            .app_data(karyawan_service.clone())
            .app_data(penggajian_service.clone())
            .app_data(pengeluaran_service.clone())
            .app_data(laporan_service.clone())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .configure(barang_controller::configure)
                    .configure(partner_controller::configure)
                    .configure(pembelian_controller::configure)
                    .configure(penjualan_controller::configure)
                    .configure(debt_controller::configure)
                    .configure(karyawan_controller::configure)
                    .configure(penggajian_controller::configure)
                    .configure(pengeluaran_controller::configure)
                    .configure(laporan_controller::configure),
            )
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "niaga"
    }))
}
