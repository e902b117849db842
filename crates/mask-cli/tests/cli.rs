use mask_core::{Channel, Image};
use std::path::Path;
use std::process::{Command, Output};

fn masktools(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_masktools"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("run masktools")
}

fn write_png(root: &Path, name: &str, image: &Image) {
    mask_io::png::write(root.join(name), image).expect("write png");
}

#[test]
fn mix_writes_packed_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write_png(root, "ao.png", &Image::filled(4, 4, [90, 0, 0, 255]));
    write_png(root, "orm.png", &Image::filled(8, 8, [0, 0, 40, 255]));

    let mask = root.join("mask.png");
    let out = Command::new(env!("CARGO_BIN_EXE_masktools"))
        .arg("--root")
        .arg(root)
        .args(["mix", "--red", "ao.png", "--green", "orm.png:b", "--resolution", "8", "-o"])
        .arg(&mask)
        .output()
        .expect("run masktools");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let packed = mask_io::png::read(&mask).expect("read mask");
    assert_eq!(packed.dimensions(), (8, 8));
    assert!(packed.pixels().iter().all(|&p| p == [90, 40, 0, 255]));
}

#[test]
fn mix_exports_named_asset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write_png(root, "rough.png", &Image::filled(4, 4, [7, 7, 7, 255]));

    let out = masktools(root, &["mix", "--green", "rough.png:r", "--resolution", "4", "--name", "Rock"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let asset = root.join("GeneratedMasks").join("T_Rock_Mask.png");
    assert!(asset.exists());
    assert!(root.join("GeneratedMasks").join("T_Rock_Mask.meta.yaml").exists());
    let packed = mask_io::png::read(&asset).expect("read asset");
    assert!(packed.channel(Channel::Green).all(|g| g == 7));
    assert!(packed.channel(Channel::Alpha).all(|a| a == 255));
}

#[test]
fn mix_without_sources_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = masktools(dir.path(), &["mix", "--resolution", "4"]);
    assert!(!out.status.success());
}

#[test]
fn split_skips_constant_channels() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    let source = Image::from_fn(4, 4, |x, y| [(x * 60) as u8, 255, (y * 60) as u8, 0]);
    write_png(root, "T_Rock_ORM.png", &source);

    let out = masktools(root, &["split", "T_Rock_ORM.png"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(root.join("T_Rock_ORM_R.png").exists());
    assert!(!root.join("T_Rock_ORM_G.png").exists());
    assert!(root.join("T_Rock_ORM_B.png").exists());
    assert!(!root.join("T_Rock_ORM_A.png").exists());

    let red = mask_io::png::read(root.join("T_Rock_ORM_R.png")).expect("read red");
    assert_eq!(red.channel(Channel::Red).collect::<Vec<_>>(), source.channel(Channel::Red).collect::<Vec<_>>());
    assert!(red.channel(Channel::Green).all(|g| g == 0));
}

#[test]
fn split_keep_empty_into_out_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    std::fs::create_dir(root.join("in")).expect("mkdir");
    write_png(root, "in/flat.png", &Image::filled(2, 2, [0, 255, 0, 255]));
    let out_dir = root.join("split");

    let out = Command::new(env!("CARGO_BIN_EXE_masktools"))
        .arg("--root")
        .arg(root)
        .args(["split", "in/flat.png", "--keep-empty", "--out-dir"])
        .arg(&out_dir)
        .output()
        .expect("run masktools");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    for suffix in ["R", "G", "B", "A"] {
        assert!(out_dir.join(format!("flat_{suffix}.png")).exists(), "{suffix}");
    }
}

#[test]
fn split_rejects_non_square() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    write_png(root, "wide.png", &Image::filled(4, 2, [10, 20, 30, 40]));

    let out = masktools(root, &["split", "wide.png"]);
    assert!(!out.status.success());
    assert!(!root.join("wide_R.png").exists());
}

#[test]
fn config_dump_reads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    let config = root.join("masktools.yaml");
    std::fs::write(&config, "mixer:\n  resolution: 1024\n  creation_method: material\n").expect("write config");

    let out = Command::new(env!("CARGO_BIN_EXE_masktools"))
        .arg("--config")
        .arg(&config)
        .args(["config", "--dump"])
        .output()
        .expect("run masktools");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let yaml = String::from_utf8_lossy(&out.stdout);
    assert!(yaml.contains("resolution: 1024"));
    assert!(yaml.contains("creation_method: material"));
}
