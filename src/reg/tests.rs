use crate::arch::aarch64::Machine;
use crate::arch::ArchName;
use crate::emu::Emulator;
use crate::reg::{transfer, RegisterMap};
use std::collections::BTreeMap;

fn captured() -> BTreeMap<String, u64> {
    let mut registers = BTreeMap::new();

    registers.insert("pc".to_string(), 0x1000);
    registers.insert("x8".to_string(), 5);
    registers.insert("fp".to_string(), 0x7ff0_0100);
    registers.insert("lr".to_string(), 0x1234);

    registers
}

#[test]
fn resolve_aliases() {
    let map = RegisterMap::for_arch(ArchName::AArch64);

    assert_eq!(map.resolve("fp"), "x29");
    assert_eq!(map.resolve("lr"), "x30");
    assert_eq!(map.resolve("x8"), "x8");
}

#[test]
fn transfer_aliased_registers() {
    let map = RegisterMap::for_arch(ArchName::AArch64);
    let mut machine = Machine::new();

    let report = transfer(&captured(), &map, &mut machine).unwrap();

    assert_eq!(report.applied.len(), 4);
    assert!(report.skipped.is_empty());
    assert_eq!(machine.read_register("x30").unwrap(), 0x1234);
    assert_eq!(machine.read_register("x29").unwrap(), 0x7ff0_0100);
    assert_eq!(machine.read_register("pc").unwrap(), 0x1000);
    assert_eq!(machine.read_register("x8").unwrap(), 5);
}

#[test]
fn transfer_skips_unknown_registers() {
    let map = RegisterMap::for_arch(ArchName::AArch64);
    let mut machine = Machine::new();
    let mut registers = captured();

    registers.insert("tpidr_el0".to_string(), 0xdead_0000);

    let report = transfer(&registers, &map, &mut machine).unwrap();

    assert_eq!(report.skipped, vec!["tpidr_el0".to_string()]);
    assert_eq!(report.applied.len(), 4);
    assert_eq!(machine.read_register("x8").unwrap(), 5);
}

#[test]
fn transfer_is_idempotent() {
    let map = RegisterMap::for_arch(ArchName::AArch64);
    let mut machine = Machine::new();

    let first = transfer(&captured(), &map, &mut machine).unwrap();
    let second = transfer(&captured(), &map, &mut machine).unwrap();

    assert_eq!(first, second);
    assert_eq!(machine.read_register("x30").unwrap(), 0x1234);
    assert_eq!(machine.read_register("x8").unwrap(), 5);
}
