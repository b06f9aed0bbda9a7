//! Full image serialization tests: byte-level read-back of built images

mod common;

use cdfs::names::joliet;
use cdfs::tree::{FileData, TreeBuilder};
use cdfs::{build_image, Error, FileDate, ImageOptions, Policy, SortOrder};
use common::*;
use std::io::Write as _;

#[test]
fn test_system_area_is_zeroed() {
    let (image, _) = build_to_vec(&sample_tree(), &ImageOptions::default());
    assert!(image[..16 * SECTOR].iter().all(|&b| b == 0));
}

#[test]
fn test_primary_descriptor_fields() {
    let tree = sample_tree();
    let options = ImageOptions {
        volume_id: "test disc".into(),
        ..Default::default()
    };
    let (image, summary) = build_to_vec(&tree, &options);
    assert_eq!(image.len(), summary.total_sectors as usize * SECTOR);

    let pvd = sector(&image, 16);
    assert_eq!(pvd[0], 1, "type code should be primary");
    assert_eq!(&pvd[1..6], b"CD001");
    assert_eq!(pvd[6], 1, "descriptor version");
    assert_eq!(&pvd[40..49], b"TEST_DISC");
    assert!(pvd[49..72].iter().all(|&b| b == b' '));
    assert_eq!(read_both_u32(pvd, 80), summary.total_sectors);
    assert_eq!(read_both_u16(pvd, 128), 2048, "logical block size");
    assert_eq!(pvd[881], 1, "file structure version");

    // The terminator closes the descriptor set.
    let terminator = sector(&image, 17);
    assert_eq!(terminator[0], 255);
    assert_eq!(&terminator[1..6], b"CD001");
}

#[test]
fn test_path_tables_agree_with_root_record() {
    let tree = sample_tree();
    let (image, _) = build_to_vec(&tree, &ImageOptions::default());
    let pvd = sector(&image, 16);

    let table_size = read_both_u32(pvd, 132) as usize;
    let l_lba = read_u32_le(pvd, 140);
    let m_lba = read_u32_be(pvd, 148);
    assert!(table_size > 0);
    assert!(l_lba > 17 && m_lba > l_lba);

    // Root record embedded in the descriptor.
    let root = &records_in(&pvd[156..190])[0];
    assert!(root.is_directory());
    assert_eq!(root.identifier, [0x00]);

    // First L table record is the root: id_len 1, parent 1, id 0x00.
    let l = sector(&image, l_lba);
    assert_eq!(l[0], 1, "root identifier length");
    assert_eq!(read_u32_le(l, 2), root.extent_lba);
    assert_eq!(read_u16_le(l, 6), 1, "root parents on itself");
    assert_eq!(l[8], 0x00);

    // Second record is DATA at depth 2.
    assert_eq!(l[10], 4);
    assert_eq!(&l[18..22], b"DATA");

    // The M table mirrors it big-endian.
    let m = sector(&image, m_lba);
    assert_eq!(m[0], 1);
    assert_eq!(read_u32_be(m, 2), root.extent_lba);
    assert_eq!(read_u16_be(m, 6), 1);
}

#[test]
fn test_directory_records_and_file_content() {
    let tree = sample_tree();
    let (image, summary) = build_to_vec(&tree, &ImageOptions::default());
    let pvd = sector(&image, 16);
    let root = &records_in(&pvd[156..190])[0];

    let root_extent = &image[root.extent_lba as usize * SECTOR
        ..root.extent_lba as usize * SECTOR + root.data_len as usize];
    let records = records_in(root_extent);
    assert_eq!(records[0].identifier, [0x00], "first record is dot");
    assert_eq!(records[1].identifier, [0x01], "second record is dotdot");
    assert_eq!(records[0].extent_lba, root.extent_lba);
    assert_eq!(
        records[1].extent_lba, root.extent_lba,
        "root dotdot points at the root itself"
    );

    let readme = find_record(root_extent, b"README.TXT;1");
    assert!(!readme.is_directory());
    assert_eq!(readme.data_len, 11);
    let content_start = readme.extent_lba as usize * SECTOR;
    assert_eq!(&image[content_start..content_start + 11], b"hello world");
    assert!(
        image[content_start + 11..content_start + SECTOR]
            .iter()
            .all(|&b| b == 0),
        "file tail sector should be zero padded"
    );

    let data = find_record(root_extent, b"DATA");
    assert!(data.is_directory());
    let data_extent =
        &image[data.extent_lba as usize * SECTOR..data.extent_lba as usize * SECTOR + SECTOR];
    let a_bin = find_record(data_extent, b"A.BIN;1");
    assert_eq!(a_bin.data_len, 5000);
    let a_start = a_bin.extent_lba as usize * SECTOR;
    assert!(image[a_start..a_start + 5000].iter().all(|&b| b == 0xAB));

    assert_eq!(summary.directory_count, 2);
    assert_eq!(summary.file_count, 2);
    assert_eq!(summary.max_depth, 2);
}

#[test]
fn test_rebuild_is_byte_identical() {
    // FileDate::Original derives all descriptor dates from the tree, so
    // two builds of the same tree produce the same bytes.
    let tree = sample_tree();
    let options = ImageOptions::default();
    assert_eq!(options.file_date, FileDate::Original);
    let (first, _) = build_to_vec(&tree, &options);
    let (second, _) = build_to_vec(&tree, &options);
    assert_eq!(first, second);
}

#[test]
fn test_joliet_supplementary_descriptor() {
    let tree = sample_tree();
    let options = ImageOptions {
        joliet: true,
        volume_id: "Mixed Case".into(),
        ..Default::default()
    };
    let (image, _) = build_to_vec(&tree, &options);

    let svd = sector(&image, 17);
    assert_eq!(svd[0], 2, "type code should be supplementary");
    assert_eq!(&svd[1..6], b"CD001");
    assert_eq!(&svd[88..91], b"%/E", "UCS-2 level 3 escape sequence");
    // Joliet keeps the original volume id text, UCS-2 encoded.
    assert_eq!(&svd[40..42], &[0x00, b'M']);
    assert_eq!(&svd[42..44], &[0x00, b'i']);

    let terminator = sector(&image, 18);
    assert_eq!(terminator[0], 255);

    // The Joliet root is a different extent with UCS-2 names, but the
    // file record addresses the same data extent as the ISO9660 one.
    let pvd_root = &records_in(&sector(&image, 16)[156..190])[0];
    let svd_root = &records_in(&svd[156..190])[0];
    assert_ne!(pvd_root.extent_lba, svd_root.extent_lba);

    let iso_extent = &image[pvd_root.extent_lba as usize * SECTOR
        ..pvd_root.extent_lba as usize * SECTOR + pvd_root.data_len as usize];
    let joliet_extent = &image[svd_root.extent_lba as usize * SECTOR
        ..svd_root.extent_lba as usize * SECTOR + svd_root.data_len as usize];
    let iso_readme = find_record(iso_extent, b"README.TXT;1");
    let joliet_readme = find_record(joliet_extent, &joliet::encode("readme.txt", true));
    assert_eq!(iso_readme.extent_lba, joliet_readme.extent_lba);
    assert_eq!(iso_readme.data_len, joliet_readme.data_len);
}

#[test]
fn test_raw_image_frames_every_sector() {
    let tree = sample_tree();
    let cooked = build_to_vec(&tree, &ImageOptions::default());
    let raw = build_to_vec(
        &tree,
        &ImageOptions {
            raw_sectors: true,
            ..Default::default()
        },
    );

    let (cooked_image, cooked_summary) = cooked;
    let (raw_image, raw_summary) = raw;
    assert_eq!(cooked_summary.total_sectors, raw_summary.total_sectors);
    assert_eq!(
        raw_image.len(),
        raw_summary.total_sectors as usize * 2352
    );

    const SYNC: [u8; 12] = [
        0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
    ];
    for lba in 0..raw_summary.total_sectors as usize {
        let frame = &raw_image[lba * 2352..(lba + 1) * 2352];
        assert_eq!(frame[..12], SYNC, "sync pattern at sector {lba}");
        assert_eq!(frame[15], 0x01, "mode byte at sector {lba}");
        // User data matches the cooked image sector for sector.
        assert_eq!(
            &frame[16..16 + SECTOR],
            &cooked_image[lba * SECTOR..(lba + 1) * SECTOR],
            "user data at sector {lba}"
        );
        assert!(
            frame[16 + SECTOR..].iter().all(|&b| b == 0),
            "EDC/ECC region should be zero filled"
        );
    }

    // Spot check the BCD minute/second/frame address: LBA 16 plus the
    // 150-sector pregap is 166 frames, MSF 00:02:16.
    let header = &raw_image[16 * 2352 + 12..16 * 2352 + 16];
    assert_eq!(header, &[0x00, 0x02, 0x16, 0x01]);
}

#[test]
fn test_host_backed_file_content() {
    let mut source = tempfile::NamedTempFile::new().expect("temp file");
    source.write_all(b"from the host filesystem").expect("write");
    source.flush().expect("flush");

    let mut builder = TreeBuilder::new();
    let root = builder.root();
    builder.add_file(
        root,
        "host.txt",
        24,
        ts(2022, 3, 4),
        FileData::Host(source.path().to_path_buf()),
    );
    let tree = builder.build();

    let (image, _) = build_to_vec(&tree, &ImageOptions::default());
    let pvd_root = &records_in(&sector(&image, 16)[156..190])[0];
    let extent = &image[pvd_root.extent_lba as usize * SECTOR
        ..pvd_root.extent_lba as usize * SECTOR + pvd_root.data_len as usize];
    let record = find_record(extent, b"HOST.TXT;1");
    let start = record.extent_lba as usize * SECTOR;
    assert_eq!(&image[start..start + 24], b"from the host filesystem");
}

#[test]
fn test_short_content_source_is_an_io_error() {
    // The declared size is authoritative; a content source with fewer
    // bytes must surface as an I/O failure, not pad or panic.
    let mut builder = TreeBuilder::new();
    let root = builder.root();
    builder.add_file(
        root,
        "short.bin",
        100,
        ts(2022, 3, 4),
        FileData::Bytes(vec![0xAA; 5]),
    );
    let tree = builder.build();

    let policy = Policy::resolve(&ImageOptions::default()).expect("policy should resolve");
    let err = build_image(&tree, &policy, Vec::new()).unwrap_err();
    match err {
        Error::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_dvd_video_layout_orders_vts_files() {
    let mut builder = TreeBuilder::new();
    let root = builder.root();
    let video_ts = builder.add_directory(root, "VIDEO_TS", ts(2022, 1, 1));
    builder.add_file_bytes(video_ts, "VTS_01_0.IFO", ts(2022, 1, 1), vec![1; 100]);
    builder.add_file_bytes(video_ts, "VIDEO_TS.IFO", ts(2022, 1, 1), vec![2; 100]);
    let tree = builder.build();

    let options = ImageOptions {
        sort: SortOrder::DvdVideo,
        ..Default::default()
    };
    let (image, _) = build_to_vec(&tree, &options);
    let pvd_root = &records_in(&sector(&image, 16)[156..190])[0];
    let root_extent = &image[pvd_root.extent_lba as usize * SECTOR
        ..pvd_root.extent_lba as usize * SECTOR + pvd_root.data_len as usize];
    let vts_dir = find_record(root_extent, b"VIDEO_TS");
    let dir_extent = &image[vts_dir.extent_lba as usize * SECTOR
        ..vts_dir.extent_lba as usize * SECTOR + vts_dir.data_len as usize];

    let records = records_in(dir_extent);
    let names: Vec<&[u8]> = records[2..].iter().map(|r| r.identifier.as_slice()).collect();
    assert_eq!(names, vec![&b"VIDEO_TS.IFO;1"[..], &b"VTS_01_0.IFO;1"[..]]);
    // VIDEO_TS.IFO sorts first, so its data extent comes first too.
    assert!(records[2].extent_lba < records[3].extent_lba);
}

#[test]
fn test_root_only_tree_builds() {
    let tree = TreeBuilder::new().build();
    let (image, summary) = build_to_vec(&tree, &ImageOptions::default());
    assert_eq!(summary.directory_count, 1);
    assert_eq!(summary.file_count, 0);

    let pvd_root = &records_in(&sector(&image, 16)[156..190])[0];
    assert_eq!(pvd_root.data_len, SECTOR as u32);
    let extent = &image[pvd_root.extent_lba as usize * SECTOR
        ..(pvd_root.extent_lba as usize + 1) * SECTOR];
    let records = records_in(extent);
    assert_eq!(records.len(), 2, "only dot and dotdot");
}
