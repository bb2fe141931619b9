use clap::Parser;
use photo_lens::{backend, cli, config, error, loader, progress, render, workflow};
use backend::HttpBackend;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use workflow::{WorkflowController, WorkflowState};

type Controller = WorkflowController<HttpBackend>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Upload { file } => {
            println!("📤 photo-lens - アップロード\n");

            let controller = build_controller(&config, cli.backend_url.as_deref())?;
            controller.select_image(loader::load_image(&file)?);
            print_selected(&controller);

            let spinner = progress::spawn_spinner(controller.subscribe());
            let result = controller.submit_image().await;
            let state = stop_spinner(controller, spinner).await;
            result?;

            println!("✔ アップロード完了");
            println!("画像URL: {}", state.remote_image_url);
        }

        Commands::Analyze { image_url, output } => {
            println!("🔍 photo-lens - 画像解析\n");

            let controller = build_controller(&config, cli.backend_url.as_deref())?;
            controller.set_remote_image_url(image_url);

            let spinner = progress::spawn_spinner(controller.subscribe());
            let result = controller.request_analysis().await;
            let state = stop_spinner(controller, spinner).await;
            if result?.is_none() {
                println!("画像URLが空のため解析をスキップしました");
                return Ok(());
            }

            println!("✔ 解析完了\n");
            report(&state, output.as_deref())?;
        }

        Commands::Run { file, output } => {
            println!("🚀 photo-lens - 一括処理\n");

            let controller = build_controller(&config, cli.backend_url.as_deref())?;
            controller.select_image(loader::load_image(&file)?);
            print_selected(&controller);

            let spinner = progress::spawn_spinner(controller.subscribe());
            let result = match controller.submit_image().await {
                Ok(_) => controller.request_analysis().await.map(|_| ()),
                Err(e) => Err(e),
            };
            let state = stop_spinner(controller, spinner).await;
            result?;

            println!("✔ アップロード・解析完了\n");
            report(&state, output.as_deref())?;
        }

        Commands::Config { set_backend_url, show } => {
            let mut config = config;

            if let Some(url) = set_backend_url {
                config.set_backend_url(url)?;
                println!("✔ バックエンドURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  バックエンドURL: {}", config.backend_url);
                println!("  実際の接続先: {}", config.resolve_backend_url(cli.backend_url.as_deref()));
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("photo_lens=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_controller(config: &Config, backend_url: Option<&str>) -> Result<Controller> {
    let url = config.resolve_backend_url(backend_url);
    let backend = HttpBackend::new(url, config.timeout())?;
    Ok(WorkflowController::new(backend))
}

fn print_selected(controller: &Controller) {
    if let Some(image) = &controller.state().selected_image {
        println!(
            "画像: {} ({}, {} bytes) → {}",
            image.file_name,
            image.mime_type,
            image.len(),
            controller.backend().base_url()
        );
    }
}

/// 状態を取り出してからコントローラを閉じ、スピナーの終了を待つ
async fn stop_spinner(controller: Controller, spinner: JoinHandle<()>) -> WorkflowState {
    let state = controller.snapshot();
    drop(controller);
    if let Err(e) = spinner.await {
        tracing::warn!(error = %e, "spinner task failed");
    }
    state
}

fn report(state: &WorkflowState, output: Option<&Path>) -> Result<()> {
    print!("{}", render::render_results(state));
    if !state.has_results() {
        println!("（ラベル・テキストは検出されませんでした）");
    }

    if let Some(output) = output {
        render::write_results_json(state, output)?;
        println!("\n✔ 結果を保存: {}", output.display());
    }
    Ok(())
}
