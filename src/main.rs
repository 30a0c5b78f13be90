use actix_web::{web, App, HttpServer};
use log::info;
use quill_server::db::Store;
use quill_server::routes;
use quill_server::settings::Settings;
use quill_server::version::VERSION;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  env_logger::init();
  let settings = Settings::get();

  let store = web::Data::new(Store::new());

  info!(
    "Starting quill_server {} at {}:{}",
    VERSION, settings.bind, settings.port
  );

  HttpServer::new(move || {
    App::new()
      .app_data(store.clone())
      .configure(routes::pages::config)
  })
  .bind((settings.bind, settings.port))?
  .run()
  .await
}
