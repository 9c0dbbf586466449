//! Splits an instruction stream into size-bounded procedure bodies.
//!
//! Target backends cap the size of a single generated routine, and large
//! icons blow past it. Splitting is a pure function of the stream and the
//! byte threshold: boundaries land only between instructions, and
//! concatenating the chunk bodies in order reconstructs the raw stream
//! byte-for-byte.

use crate::walk::Instruction;

/// Body of one generated `paint_N` procedure.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub body: String,
}

/// Split `instructions` into chunks of at most `threshold_bytes` each.
///
/// A boundary is inserted before the instruction that would push the
/// accumulated body past the threshold, so a body only exceeds the
/// threshold when a single instruction does on its own. Streams shorter
/// than the threshold (the empty stream included) yield exactly one chunk.
pub fn split(instructions: &[Instruction], threshold_bytes: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut body = String::new();

    for instruction in instructions {
        if !body.is_empty() && body.len() + instruction.text.len() > threshold_bytes {
            chunks.push(Chunk {
                body: std::mem::take(&mut body),
            });
        }
        body.push_str(&instruction.text);
    }
    chunks.push(Chunk { body });

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(count: usize, len: usize) -> Vec<Instruction> {
        // `len`-byte instructions, newline included.
        (0..count)
            .map(|i| Instruction::new(format!("{:0>width$};\n", i, width = len - 2)))
            .collect()
    }

    fn reassemble(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.body.as_str()).collect()
    }

    #[test]
    fn short_stream_yields_one_chunk() {
        let instructions = stream(3, 10);
        let chunks = split(&instructions, 3000);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn empty_stream_yields_one_empty_chunk() {
        let chunks = split(&[], 3000);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].body.is_empty());
    }

    #[test]
    fn nine_thousand_bytes_at_three_thousand_yield_three_chunks() {
        let instructions = stream(90, 100);
        let chunks = split(&instructions, 3000);
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.body.len() <= 3000);
        }
    }

    #[test]
    fn concatenation_reconstructs_the_stream() {
        let instructions = stream(57, 83);
        let raw: String = instructions.iter().map(|i| i.text.as_str()).collect();
        let chunks = split(&instructions, 1000);
        assert_eq!(reassemble(&chunks), raw);
    }

    #[test]
    fn boundaries_never_fall_inside_an_instruction() {
        let instructions = stream(40, 90);
        for chunk in split(&instructions, 700) {
            assert!(chunk.body.len() % 90 == 0);
        }
    }

    #[test]
    fn oversized_instruction_gets_its_own_chunk() {
        let mut instructions = stream(2, 100);
        instructions.insert(1, Instruction::new("x".repeat(5000) + "\n"));
        let chunks = split(&instructions, 3000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].body.len(), 5001);
        let raw: String = instructions.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(reassemble(&chunks), raw);
    }
}
