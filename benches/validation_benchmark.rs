use criterion::{criterion_group, criterion_main, Criterion};
use skillswap_session::validation::{validate_email, validate_sign_up};
use std::hint::black_box;

fn benchmark_validation(c: &mut Criterion) {
    let long_bio = "b".repeat(500);
    let long_name = "n".repeat(100);

    let mut group = c.benchmark_group("form_validation");

    group.bench_function("email_valid", |b| {
        b.iter(|| validate_email(black_box("asha.k+swap@campus.example.edu")))
    });

    group.bench_function("email_invalid", |b| {
        b.iter(|| validate_email(black_box("asha@localhost")))
    });

    group.bench_function("sign_up_valid", |b| {
        b.iter(|| {
            validate_sign_up(
                black_box(&long_name),
                black_box("asha@test.edu"),
                black_box("Passw0rd"),
                black_box("Passw0rd"),
            )
        })
    });

    group.bench_function("sign_up_all_fields_invalid", |b| {
        b.iter(|| {
            validate_sign_up(
                black_box("12345"),
                black_box("a@b"),
                black_box("short"),
                black_box(&long_bio),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_validation);
criterion_main!(benches);
