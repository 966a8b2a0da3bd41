use anyhow::Result;
use axum::{middleware as axum_middleware, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use fleet_command::config::environment::EnvironmentConfig;
use fleet_command::database::create_pool;
use fleet_command::middleware::auth_middleware::auth_middleware;
use fleet_command::middleware::cors::cors_middleware;
use fleet_command::routes;
use fleet_command::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚑 Fleet Command - Comisionado y Compliance de Flota");
    info!("====================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    info!("✅ Base de datos conectada");
    info!("🏷️  App mode: {:?} | Entry mode: {:?}", config.app_mode, config.entry_mode);

    let app_state = AppState::new(pool, config.clone());

    // Rutas de auth: públicas + /capabilities detrás del middleware
    let auth_router = routes::auth_routes::create_public_auth_router().merge(
        routes::auth_routes::create_auth_router().route_layer(
            axum_middleware::from_fn_with_state(app_state.clone(), auth_middleware),
        ),
    );

    // Árbol protegido: JWT + gate de tenant por entry mode
    let protected = Router::new()
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/task", routes::task_routes::create_task_router())
        .nest("/api/import", routes::import_routes::create_import_router())
        .nest("/api/inspection", routes::inspection_routes::create_inspection_router())
        .nest("/api/region", routes::region_routes::create_region_router())
        .nest("/api/user", routes::user_routes::create_user_router())
        .nest("/api/invitation", routes::invitation_routes::create_invitation_router())
        .nest("/api/smartsheet", routes::sync_routes::create_sync_router())
        .nest("/api/demo", routes::demo_routes::create_demo_router())
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Crear router de la API
    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", auth_router)
        .merge(protected)
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/login - Login");
    info!("   POST /api/auth/signup - Alta demo (solo modo demo)");
    info!("   POST /api/auth/refresh - Refresh token");
    info!("   POST /api/auth/accept-invitation - Aceptar invitación");
    info!("   GET  /api/auth/capabilities - Predicados de capacidad");
    info!("🚗 Vehículos:");
    info!("   POST /api/vehicle - Registrar vehículo");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   PUT  /api/vehicle/:id - Actualizar vehículo");
    info!("   PUT  /api/vehicle/:id/status - Cambiar estado");
    info!("   GET  /api/vehicle/:id/tasks - Checklist de comisionado");
    info!("   GET  /api/vehicle/:id/inspections - Inspecciones");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo");
    info!("📋 Workflow:");
    info!("   GET  /api/task/templates - Listar templates");
    info!("   POST /api/task/templates - Crear paso de template");
    info!("   PUT  /api/task/:id/status - Transicionar tarea");
    info!("   PUT  /api/task/:id/assign - Asignar tarea");
    info!("📥 Import CSV:");
    info!("   POST /api/import/vehicles - Importar vehículos");
    info!("   POST /api/import/task-templates - Importar templates");
    info!("👥 Usuarios e invitaciones:");
    info!("   GET  /api/user - Listar usuarios (admin)");
    info!("   PUT  /api/user/roles/:id - Cambiar rol (admin)");
    info!("   POST /api/invitation - Invitar usuario (admin)");
    info!("📊 Smartsheet:");
    info!("   GET  /api/smartsheet/sheets - Listar hojas");
    info!("   POST /api/smartsheet/fetch - Traer hojas seleccionadas");
    info!("   POST /api/smartsheet/sync - Sincronizar hojas");
    info!("   GET  /api/smartsheet/sheets/:id/export - Exportar CSV");
    info!("   GET  /api/smartsheet/logs - Historial de sync");
    info!("🌱 Demo:");
    info!("   POST /api/demo/seed - Sembrar datos demo");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                anyhow::anyhow!(e)
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-command",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
