use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-lens")]
#[command(about = "画像をアップロードしてラベル・テキストを検出するクライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// バックエンドのURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をアップロードして公開URLを表示
    Upload {
        /// 画像ファイルのパス
        #[arg(required = true)]
        file: PathBuf,
    },

    /// 公開URLの画像を解析
    Analyze {
        /// バケット内の画像URL
        #[arg(required = true)]
        image_url: String,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// アップロードから解析まで一括実行
    Run {
        /// 画像ファイルのパス
        #[arg(required = true)]
        file: PathBuf,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// バックエンドのURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
