use crate::arch::ArchName;
use std::str::FromStr;

#[test]
fn arch_from_str() {
    assert_eq!(ArchName::from_str("aarch64"), Ok(ArchName::AArch64));
    assert_eq!(ArchName::from_str("ARM64"), Ok(ArchName::AArch64));
    assert_eq!(ArchName::from_str("sm83"), Err(()));
}

#[test]
fn arch_deserialize() {
    let arch: ArchName = serde_json::from_str("\"arm64\"").unwrap();

    assert_eq!(arch, ArchName::AArch64);
    assert!(serde_json::from_str::<ArchName>("\"z80\"").is_err());
}

#[test]
fn aarch64_aliases() {
    let aliases = ArchName::AArch64.register_aliases();

    assert_eq!(aliases.get("fp"), Some(&"x29"));
    assert_eq!(aliases.get("lr"), Some(&"x30"));
    assert_eq!(aliases.get("pc"), None);
    assert_eq!(ArchName::AArch64.pointer_width(), 8);
}
