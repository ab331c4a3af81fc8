//! 문자열 템플릿 치환.
//!
//! `{name}` 형태의 이름 있는 플레이스홀더를 값으로 치환한다.
//! 위치 기반(`{0}`, `{1}`) 치환의 암묵적 순서 의존을 피한다.

/// 템플릿의 `{name}` 플레이스홀더를 치환한다.
///
/// 같은 이름이 여러 번 나오면 전부 치환하고,
/// params에 없는 플레이스홀더는 그대로 남긴다.
pub fn render(template: &str, params: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
