pub mod handlers;

pub use handlers::*;

use actix_web::web;

/// Register every dashboard route: `/health` plus the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(
        web::scope("/api")
            .service(get_chains)
            .service(select_chain)
            .service(explorer_link)
            .service(get_notices)
            .service(dismiss_notice)
            .service(get_session)
            .service(login)
            .service(logout)
            .service(get_orders)
            .service(lookup_transaction)
            .service(contract_status)
            .service(get_tokens)
            .service(check_blacklist)
            .service(submit_admin_call)
            .service(get_analytics)
            .service(download_orders_report),
    );
}
