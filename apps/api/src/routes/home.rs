use axum::response::Html;

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>ResumeWise API</title>
    </head>
    <body>
        <h1>Welcome to ResumeWise API</h1>
        <p>AI-powered resume screening and analysis.</p>
        <p>POST /api/screen with a resume and a job description to get started.</p>
    </body>
</html>
"#;

/// GET /
pub async fn home_handler() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}
