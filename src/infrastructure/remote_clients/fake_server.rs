use actix_web::{web, App, HttpServer};

/// Start a throwaway local HTTP server and return its base URL.
///
/// Must be called from inside an actix runtime (`#[actix_web::test]`).
pub(crate) fn spawn(configure: fn(&mut web::ServiceConfig)) -> String {
    let server = HttpServer::new(move || App::new().configure(configure))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake server");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}
