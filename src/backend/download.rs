//! 下载文件名解析
//!
//! 从 `Content-Disposition` 响应头中提取 `filename=` 参数，
//! 缺失或无法解析时回退到固定默认名

/// 默认结果文件名
pub const DEFAULT_RESULTS_FILENAME: &str = "netflix_check_results.json";

/// 从 Content-Disposition 头中解析文件名
///
/// 支持的形式：
/// - `attachment; filename="r.json"`
/// - `attachment; filename=r.json`
/// - `inline; filename='r.json'`
///
/// 头缺失、没有 filename 参数或参数为空时返回 [`DEFAULT_RESULTS_FILENAME`]
pub fn filename_from_content_disposition(header: Option<&str>) -> String {
    let Some(value) = header else {
        return DEFAULT_RESULTS_FILENAME.to_string();
    };

    for part in value.split(';') {
        let part = part.trim();
        let Some((key, raw)) = part.split_once('=') else {
            continue;
        };
        if !key.trim().eq_ignore_ascii_case("filename") {
            continue;
        }
        let name = raw.trim().trim_matches(|c| c == '"' || c == '\'');
        if !name.is_empty() {
            return name.to_string();
        }
    }

    DEFAULT_RESULTS_FILENAME.to_string()
}
