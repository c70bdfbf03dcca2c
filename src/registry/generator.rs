//! 短码生成器
//!
//! 生成器是纯函数式的：不访问注册表，也不检查唯一性，冲突由 Registry 负责。

/// 随机短码长度
pub const CODE_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Trait for generating short codes.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// 基于线程本地 CSPRNG 的随机短码生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(CODE_LENGTH)
    }
}

/// 生成指定长度的随机字母数字串
pub fn generate_random_code(length: usize) -> String {
    std::iter::repeat_with(|| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
        .take(length)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_code_shape() {
        let code = RandomCodeGenerator.generate();
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_custom_length() {
        assert_eq!(generate_random_code(12).len(), 12);
        assert!(generate_random_code(0).is_empty());
    }

    #[test]
    fn test_codes_rarely_repeat() {
        // 62^6 的空间里 1000 个样本几乎不可能碰撞
        let codes: HashSet<String> = (0..1000).map(|_| RandomCodeGenerator.generate()).collect();
        assert!(codes.len() >= 999);
    }

    #[test]
    fn test_concurrent_generation() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..100)
                        .map(|_| RandomCodeGenerator.generate())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for code in handle.join().unwrap() {
                assert_eq!(code.len(), CODE_LENGTH);
            }
        }
    }
}
