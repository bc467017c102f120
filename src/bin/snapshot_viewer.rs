use std::io::Write;

use newsdeck::{
    app_config_from_env, init_logging, log_app_start, log_page_written, log_source_selected,
    logging_config_from_env, LoadOutcome, SourceConfig, Viewer,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_cfg = logging_config_from_env();
    init_logging(&logging_cfg)?;
    log_app_start(&logging_cfg);

    let cfg = app_config_from_env()?;
    let location = match &cfg.source {
        SourceConfig::Http(http) => http.base_url.clone(),
        SourceConfig::Dir(root) => root.display().to_string(),
    };
    log_source_selected(cfg.source.kind(), &location);

    let viewer = Viewer::new(cfg.source.build()?, cfg.viewer.clone());
    let outcome = viewer.load_dates().await;

    if let Some(date) = cfg.initial_date.as_deref() {
        let already_selected = viewer.page().selected_date.as_deref() == Some(date);
        if outcome == LoadOutcome::Loaded && !already_selected {
            viewer.select_date(date).await;
        }
    }

    let html = viewer.render_html(&cfg.page_title);
    match &cfg.output {
        Some(path) => {
            tokio::fs::write(path, html.as_bytes()).await?;
            log_page_written(&path.display().to_string(), html.len());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
            log_page_written("stdout", html.len());
        }
    }

    Ok(())
}
