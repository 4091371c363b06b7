pub mod disc;
pub mod epq;
pub mod mbti;
