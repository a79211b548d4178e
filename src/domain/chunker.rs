//! 文本分块器
//!
//! 将整段书文按句末标点切分为可朗读的片段，供播放队列使用

/// 检查是否为句末终止符（中英文句末标点或换行）
#[inline]
fn is_terminator(ch: char) -> bool {
    matches!(ch, '。' | '！' | '？' | '.' | '!' | '?' | '\n')
}

/// 将文本按句子边界切分为朗读片段
///
/// 切分策略：
/// 1. 在每一段连续终止符之后断开，终止符归属于它所结束的片段
/// 2. 末尾没有终止符的剩余文本单独成为最后一个片段
/// 3. 片段去除首尾空白，空白片段被丢弃
///
/// 仅由终止符构成的输入（如 `"..."`）保留为单个片段，不会被丢弃。
/// 纯函数，对相同输入幂等。
pub fn split_into_chunks(text: &str) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_terminator_run = false;

    for ch in text.chars() {
        let terminator = is_terminator(ch);

        // 终止符串结束，前面累积的内容构成一个片段
        if in_terminator_run && !terminator {
            flush(&mut current, &mut chunks);
        }

        current.push(ch);
        in_terminator_run = terminator;
    }

    // 剩余内容（可能没有终止符结尾）
    flush(&mut current, &mut chunks);

    chunks
}

fn flush(current: &mut String, chunks: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chinese_sentences() {
        let chunks = split_into_chunks("你好。今天天气不错！我们去公园吗？");
        assert_eq!(chunks, vec!["你好。", "今天天气不错！", "我们去公园吗？"]);
    }

    #[test]
    fn test_terminator_belongs_to_preceding_chunk() {
        let chunks = split_into_chunks("第一句。第二句！");
        assert_eq!(chunks, vec!["第一句。", "第二句！"]);
    }

    #[test]
    fn test_newline_is_terminator() {
        let chunks = split_into_chunks("第一句。\n第二句。");
        assert_eq!(chunks, vec!["第一句。", "第二句。"]);
    }

    #[test]
    fn test_trailing_text_without_terminator() {
        let chunks = split_into_chunks("完整的一句。还没说完的");
        assert_eq!(chunks, vec!["完整的一句。", "还没说完的"]);
    }

    #[test]
    fn test_terminator_only_input_kept() {
        // 纯终止符内容不能被丢弃
        assert_eq!(split_into_chunks("..."), vec!["..."]);
        assert_eq!(split_into_chunks("。！？"), vec!["。！？"]);
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert!(split_into_chunks("").is_empty());
        assert!(split_into_chunks("   \n  \n").is_empty());
    }

    #[test]
    fn test_mixed_terminator_runs() {
        // 连续终止符作为一个整体归属前一片段
        let chunks = split_into_chunks("真的吗？！当然。。。好吧");
        assert_eq!(chunks, vec!["真的吗？！", "当然。。。", "好吧"]);
    }

    #[test]
    fn test_english_sentences() {
        let chunks = split_into_chunks("Hello world. How are you? Fine!");
        assert_eq!(chunks, vec!["Hello world.", "How are you?", "Fine!"]);
    }

    #[test]
    fn test_crlf_line_breaks() {
        let chunks = split_into_chunks("第一行。\r\n第二行。");
        assert_eq!(chunks, vec!["第一行。", "第二行。"]);
    }

    #[test]
    fn test_idempotent_over_rejoin() {
        // split(join(split(text))) == split(text)
        let texts = [
            "你好。今天天气不错！我们去公园吗？",
            "第一句。\n第二句。",
            "...",
            "Mr. Smith went. To town",
            "尾部没有标点的内容",
        ];
        for text in texts {
            let once = split_into_chunks(text);
            let rejoined: String = once.concat();
            assert_eq!(split_into_chunks(&rejoined), once, "text: {:?}", text);
        }
    }
}
