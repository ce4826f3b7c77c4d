// ==========================================
// 学生花名册服务 - 响应消息本地化
// ==========================================
// 文案: locales/*.yml（由 lib.rs 中的 rust_i18n::i18n! 加载）
// 语言: 进程级设置，启动时由配置 app.locale 决定，缺省英文
// 占位符: %{name}，未提供的占位符原样保留
// ==========================================

use std::fmt;

// ==========================================
// Locale - 支持的语言
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    ZhCn,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::ZhCn];

    /// locales 目录中的文件名
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhCn => "zh-CN",
        }
    }

    /// 解析语言代码（大小写不敏感，"_" 与 "-" 等价，"zh" 视为简体中文）
    pub fn parse(code: &str) -> Option<Self> {
        let normalized = code.trim().replace('_', "-").to_ascii_lowercase();
        match normalized.as_str() {
            "en" | "en-us" | "en-gb" => Some(Locale::En),
            "zh" | "zh-cn" | "zh-hans" => Some(Locale::ZhCn),
            _ => None,
        }
    }

    /// 当前生效的语言（未知代码按默认语言处理）
    pub fn current() -> Self {
        Self::parse(&rust_i18n::locale()).unwrap_or_default()
    }

    /// 设为进程级语言
    pub fn activate(self) {
        rust_i18n::set_locale(self.code());
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 当前语言下的消息
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 当前语言下的消息，并填充 %{name} 占位符
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    interpolate(&t(key), args)
}

fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 2..];

        let Some(end) = tail.find('}') else {
            // 未闭合
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &tail[..end];
        match args.iter().find(|(k, _)| *k == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}

/// 切换语言的单元测试之间互斥（语言是进程级状态）
#[cfg(test)]
pub(crate) static ACTIVE_LOCALE: std::sync::Mutex<()> = std::sync::Mutex::new(());
