use axum::response::Html;

static HOME_HTML: &str = include_str!("../web/home.html");
static ADMIN_HTML: &str = include_str!("../web/admin.html");

pub async fn home_page() -> Html<&'static str> {
    Html(HOME_HTML)
}

pub async fn admin_page() -> Html<&'static str> {
    Html(ADMIN_HTML)
}

pub async fn success_page() -> Html<&'static str> {
    Html(
        "<html><body style=\"font-family:system-ui;padding:2rem\">\
         <h1>Payment successful!</h1><p>Thanks, your appointment is booked.</p>\
         </body></html>",
    )
}

pub async fn cancel_page() -> Html<&'static str> {
    Html(
        "<html><body style=\"font-family:system-ui;padding:2rem\">\
         <h1>Payment canceled</h1><p>Your booking was not completed.</p>\
         </body></html>",
    )
}
