mod commands;
mod form_file;

use card_service::api_client::{ReqwestCardApi, SessionContext};
use card_service::biz_service::card_application_service::CardApplicationService;
use common::config::{AppConfig, DEFAULT_CONFIG_FILE};
use common::{AppError, ApplicationId};
use log::{LevelFilter, error, warn};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_file = take_config_arg(&mut args).unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

    // 读取配置文件
    let app_cfg = AppConfig::init(&config_file)?;
    //初始化日志
    init_log(&app_cfg)?;

    let api = ReqwestCardApi::from_config(&app_cfg.get_server())?;
    CardApplicationService::init(Arc::new(api));
    let session = SessionContext::new(app_cfg.get_session().token.unwrap_or_default());
    if !session.is_authenticated() {
        warn!("no session token configured, only login/register/classify are available");
    }

    if let Err(e) = run(&args, &session).await {
        error!("{:?}", e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: &[String], session: &SessionContext) -> common::Result<()> {
    let arg = |i: usize| args.get(i).map(String::as_str);
    match (arg(0), arg(1), arg(2)) {
        (Some("list"), _, _) => commands::list(session).await,
        (Some("classify"), Some(comments), _) => {
            commands::classify_comments(comments);
            Ok(())
        }
        (Some("apply"), Some(form), _) => commands::apply(session, Path::new(form)).await,
        (Some("resubmit"), Some(id), Some(form)) => commands::resubmit(session, parse_id(id)?, Path::new(form)).await,
        (Some("cancel"), Some(id), _) => commands::cancel(session, parse_id(id)?).await,
        (Some("login"), Some(phone), Some(password)) => commands::login(phone, password).await,
        (Some("register"), Some(form), _) => commands::register(Path::new(form)).await,
        _ => {
            commands::print_help();
            Ok(())
        }
    }
}

fn take_config_arg(args: &mut Vec<String>) -> Option<String> {
    let pos = args.iter().position(|a| a == "--config")?;
    if pos + 1 >= args.len() {
        return None;
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}

fn parse_id(text: &str) -> common::Result<ApplicationId> {
    text.parse().map_err(|_| AppError::validation(format!("非法的申请编号: {}", text)))
}

pub fn init_log(config: &AppConfig) -> anyhow::Result<()> {
    let log_level = config.get_sys().log_level;
    env_logger::Builder::new().filter(None, LevelFilter::from_str(&log_level)?).init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_flag_is_removed_from_args() {
        let mut args: Vec<String> = ["--config", "dev.toml", "list"].iter().map(|s| s.to_string()).collect();
        assert_eq!(take_config_arg(&mut args).as_deref(), Some("dev.toml"));
        assert_eq!(args, vec!["list".to_string()]);
    }

    #[test]
    fn application_id_must_be_numeric() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::Validation(_))));
    }
}
