// ==========================================
// 学生花名册服务 - 命令行入口
// ==========================================
// 用法:
//   student-roster import <file>
//   student-roster list [page] [size] [search] [sort_by] [direction]
//   student-roster recent [page] [size]
//   student-roster get <id>
//   student-roster health
//   student-roster config [key] [value]
//
// 数据库路径: STUDENT_ROSTER_DB_PATH 或用户数据目录
// 输出: ServiceResult JSON（stdout）；日志写 stderr
// ==========================================

use serde::Serialize;
use std::error::Error;
use student_roster::app::{get_default_db_path, AppState};
use student_roster::domain::{PaginationParameters, StudentQueryParameters};
use student_roster::{logging, FilePayload, ServiceResult, SortDirection, StudentSortField};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const USAGE: &str = "\
用法:
  student-roster import <file>
  student-roster list [page] [size] [search] [sort_by] [direction]
  student-roster recent [page] [size]
  student-roster get <id>
  student-roster health
  student-roster config [key] [value]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    tracing::info!("{} v{}", student_roster::APP_NAME, student_roster::VERSION);

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path)?;

    // Ctrl-C 触发取消
    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("收到中断信号，正在取消");
                token.cancel();
            }
        });
    }

    let rest = &args[1..];
    let success = match command {
        "import" => {
            let Some(path) = rest.first() else {
                eprintln!("{}", USAGE);
                std::process::exit(2);
            };
            let payload = FilePayload::from_path(path)?;
            emit(&state.student_api.import_students(payload, &token).await)?
        }
        "list" => {
            let params = parse_query(rest);
            emit(&state.student_api.get_students(&params, &token).await)?
        }
        "recent" => {
            let pagination = PaginationParameters::new(
                parse_or(rest.first(), 1),
                parse_or(rest.get(1), 10),
            );
            emit(&state.student_api.get_recent_students(pagination, &token).await)?
        }
        "get" => {
            let id = match rest.first().map(|s| Uuid::parse_str(s.trim())) {
                Some(Ok(id)) => id,
                _ => {
                    eprintln!("无效的学生ID");
                    std::process::exit(2);
                }
            };
            emit(&state.student_api.get_student(id, &token).await)?
        }
        "health" => emit(&state.health_api.check().await)?,
        "config" => {
            match (rest.first(), rest.get(1)) {
                (Some(key), Some(value)) => {
                    state.config_manager.set_global_config_value(key, value)?;
                    println!("{} = {}", key, value);
                }
                (Some(key), None) => {
                    let value = state.config_manager.get_global_config_value(key)?;
                    println!("{} = {}", key, value.unwrap_or_default());
                }
                _ => {
                    let mut all: Vec<_> = state.config_manager.get_all_global()?.into_iter().collect();
                    all.sort();
                    for (key, value) in all {
                        println!("{} = {}", key, value);
                    }
                }
            }
            true
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

/// 输出结果，返回是否成功
fn emit<T: Serialize>(result: &ServiceResult<T>) -> Result<bool, Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(result.is_success())
}

fn parse_or(arg: Option<&String>, default: u32) -> u32 {
    arg.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

fn parse_query(args: &[String]) -> StudentQueryParameters {
    let mut params = StudentQueryParameters::new()
        .with_page(parse_or(args.first(), 1), parse_or(args.get(1), 10));
    if let Some(search) = args.get(2) {
        params = params.with_search(search.as_str());
    }
    let sort_by = args
        .get(3)
        .map(|s| StudentSortField::parse_lenient(s))
        .unwrap_or_default();
    let direction = args
        .get(4)
        .map(|s| SortDirection::parse_lenient(s))
        .unwrap_or_default();
    params.with_sort(sort_by, direction)
}
