//! 模板替换
//!
//! URL 查询参数与请求体模板共用的 `{{key}}` 占位符替换

use std::collections::BTreeMap;

/// 模板替换值表
pub type TemplateValues = BTreeMap<String, String>;

/// 替换模板中所有 `{{key}}` 占位符
///
/// key 由字母、数字、下划线组成。值表中不存在的 key 原样保留
/// `{{key}}`，不替换为空串也不报错。单次从左到右扫描，不递归。
pub fn render(template: &str, values: &TemplateValues) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) if is_key(&after_open[..end]) => {
                let key = &after_open[..end];
                match values.get(key) {
                    Some(value) => output.push_str(value),
                    // 未解析的占位符保留原文
                    None => {
                        output.push_str("{{");
                        output.push_str(key);
                        output.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            _ => {
                // 不是合法占位符，按字面输出 "{{" 后继续
                output.push_str("{{");
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}

#[inline]
fn is_key(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> TemplateValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_basic_substitution() {
        let vals = values(&[("text", "World")]);
        assert_eq!(render("Hello {{text}}", &vals), "Hello World");
    }

    #[test]
    fn test_unknown_key_left_verbatim() {
        let vals = values(&[("text", "World")]);
        assert_eq!(render("Hello {{unknown}}", &vals), "Hello {{unknown}}");
    }

    #[test]
    fn test_multiple_occurrences() {
        let vals = values(&[("a", "1"), ("b", "2")]);
        assert_eq!(render("{{a}}+{{b}}={{a}}{{b}}", &vals), "1+2=12");
    }

    #[test]
    fn test_json_body_template() {
        let vals = values(&[("text", "你好")]);
        assert_eq!(
            render(r#"{"text":"{{text}}","lang":"zh"}"#, &vals),
            r#"{"text":"你好","lang":"zh"}"#
        );
    }

    #[test]
    fn test_no_recursive_substitution() {
        // 替换结果中的占位符不会再次被替换
        let vals = values(&[("a", "{{b}}"), ("b", "oops")]);
        assert_eq!(render("{{a}}", &vals), "{{b}}");
    }

    #[test]
    fn test_malformed_braces_left_alone() {
        let vals = values(&[("text", "World")]);
        assert_eq!(render("{{text", &vals), "{{text");
        assert_eq!(render("{{ text }}", &vals), "{{ text }}");
        assert_eq!(render("{text}", &vals), "{text}");
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(render("", &TemplateValues::new()), "");
    }
}
