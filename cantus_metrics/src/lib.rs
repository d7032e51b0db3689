// Cantus metrics core
//
// Information-theoretic measures for symbolic music sequences: zero-order
// entropy, k-order Markov (conditional) entropy, maximum entropy,
// redundancy, a predictability index, and Lempel-Ziv complexity, globally
// and over sliding windows.
//
// Architecture:
// - token.rs: melodic token type, note-name parsing, input standardization
// - alphabet.rs: first-seen symbol encoder with a bidirectional alphabet
// - entropy.rs: Shannon / Markov / maximum entropy, redundancy, IP
// - lzc.rs: binary projection and LZ76 production counting
// - window.rs: sliding-window iterator and per-window metric driver
// - analysis.rs: configuration, metric records, and the orchestrator that
//   ties the estimators together for one melody/rhythm pair
//
// Everything here is a pure, synchronous computation over immutable
// in-memory sequences. File formats, export, and the CLI live in the
// cantus_analyzer crate.

pub mod alphabet;
pub mod analysis;
pub mod entropy;
pub mod lzc;
pub mod token;
pub mod window;
