use crate::snapshot::{Error, Region, Snapshot};

const DUMP: &str = r#"{
  "process": { "pid": 4242, "ppid": 1, "executable": "target" },
  "thread": { "tid": 4243, "name": null },
  "registers": { "pc": 4096, "x8": 5, "fp": 8192, "lr": 4100 },
  "regions": [
    { "start": 12288, "end": 16384, "x": false, "r": true, "w": false, "m": true, "name": "" },
    {
      "start": 4096, "end": 8192, "x": true, "r": true, "w": true, "m": true,
      "name": "__TEXT", "pretty": "[0x1000-0x2000) rwx __TEXT"
    }
  ]
}"#;

#[test]
fn snapshot_parse() {
    let snapshot = Snapshot::from_reader(DUMP.as_bytes()).unwrap();

    assert_eq!(snapshot.process().pid, 4242);
    assert_eq!(snapshot.process().executable, "target");
    assert_eq!(snapshot.thread().tid, 4243);
    assert_eq!(snapshot.thread().name, None);
    assert_eq!(snapshot.registers().get("x8"), Some(&5));
    assert_eq!(snapshot.iter_regions().count(), 2);
    assert_eq!(snapshot.total_size(), 0x2000);
}

#[test]
fn snapshot_region_fields() {
    let snapshot = Snapshot::from_reader(DUMP.as_bytes()).unwrap();
    let text = snapshot.iter_regions().nth(1).unwrap();

    assert_eq!(text.start(), 0x1000);
    assert_eq!(text.end(), 0x2000);
    assert!(text.is_readable() && text.is_writable() && text.is_executable());
    assert!(text.is_mapped());
    assert_eq!(text.as_name(), "__TEXT");
    assert_eq!(text.as_pretty(), Some("[0x1000-0x2000) rwx __TEXT"));
    assert_eq!(text.perms(), "rwx");
}

#[test]
fn snapshot_missing_field() {
    let dump = r#"{ "process": { "pid": 1, "ppid": 0, "executable": "a" }, "registers": {}, "regions": [] }"#;

    match Snapshot::from_reader(dump.as_bytes()) {
        Err(Error::MalformedSnapshot(_)) => {}
        other => panic!("expected malformed snapshot, got {:?}", other),
    }
}

#[test]
fn snapshot_inverted_region() {
    let dump = r#"{
      "process": { "pid": 1, "ppid": 0, "executable": "a" },
      "thread": { "tid": 1, "name": "main" },
      "registers": {},
      "regions": [ { "start": 8192, "end": 4096, "x": false, "r": true, "w": false, "m": true, "name": "" } ]
    }"#;

    match Snapshot::from_reader(dump.as_bytes()) {
        Err(Error::EmptyRegion { index, start, end }) => {
            assert_eq!(index, 0);
            assert_eq!(start, 0x2000);
            assert_eq!(end, 0x1000);
        }
        other => panic!("expected empty region error, got {:?}", other),
    }
}

#[test]
fn region_backing_key() {
    let region = Region::new(0x7ff0_0000, 0x7ff0_4000, true, false, false);

    assert_eq!(region.backing_key(), "0x7ff00000-0x7ff04000");
}

#[test]
fn region_contains_is_half_open() {
    let region = Region::new(0x1000, 0x2000, true, false, false);

    assert!(!region.contains(0xfff));
    assert!(region.contains(0x1000));
    assert!(region.contains(0x1fff));
    assert!(!region.contains(0x2000));
}
