use criterion::{criterion_group, criterion_main, Criterion};

use control_parse::{ControlFile, Paragraph};

fn packages_fixture() -> String {
    let mut text = String::new();
    for i in 0..500 {
        text.push_str(&format!(
            "Package: com.example.tweak{i}\n\
             Name: Example Tweak {i}\n\
             Version: 1.{i}.0\n\
             Architecture: iphoneos-arm\n\
             Depends: mobilesubstrate (>= 0.9.5000)\n\
             Filename: ./debs/com.example.tweak{i}_1.{i}.0_iphoneos-arm.deb\n\
             Size: {size}\n\
             Description: An example tweak\n \
             Longer text for benchmarking the parser.\n\n",
            size = 10000 + i * 17,
        ));
    }
    text
}

fn parse_packages_benchmark(c: &mut Criterion) {
    let text = packages_fixture();

    c.bench_function("parse_packages", |b| {
        b.iter(|| ControlFile::parse(&text));
    });
}

fn parse_paragraph_benchmark(c: &mut Criterion) {
    let text = "Package: com.example.tweak\nVersion: 1.2.0\nFilename: ./debs/com.example.tweak_1.2.0.deb\n";

    c.bench_function("parse_paragraph", |b| {
        b.iter(|| Paragraph::parse(text));
    });
}

criterion_group!(benches, parse_packages_benchmark, parse_paragraph_benchmark);
criterion_main!(benches);
