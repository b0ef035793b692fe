// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Insets, Rect, Size};
use understory_canvas::{
    ApplyMode, CanvasController, CanvasOptions, Height, SharedFrame, UiState, UiStore, Viewport,
};
use understory_fit::{BoxModel, FrameBox, ResizeSignal, compute, measure};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_px(&mut self, upper: u32) -> f64 {
        f64::from(self.next_u32() % upper)
    }
}

fn frame_boxes(count: usize, seed: u64) -> Vec<FrameBox> {
    let mut rng = Lcg::new(seed);
    // Include zero widths so the not-ready branch is measured too.
    (0..count)
        .map(|_| FrameBox::new(rng.gen_px(2_560), rng.gen_px(1_600)))
        .collect()
}

fn bench_zoom_config(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_fit");
    group.sample_size(50);

    let boxes = frame_boxes(1_024, 0xF17_0000_0000_0001);
    for (name, height) in [("auto", Height::Auto), ("fixed", Height::Fixed(720.0))] {
        let viewport = Viewport::new(1_280.0, height);
        group.bench_function(format!("compute({name},n={})", boxes.len()), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for frame in &boxes {
                    let config = compute(black_box(&viewport), *frame);
                    sum += config.zoom + config.root_height;
                }
                black_box(sum)
            });
        });
    }

    let framed = BoxModel::new(Rect::new(0.0, 0.0, 1_024.0, 768.0))
        .with_border(Insets::uniform(1.0))
        .with_padding(Insets::uniform(12.0));
    group.bench_function("measure(border+padding)", |b| {
        b.iter(|| black_box(measure(Some(black_box(&framed)))));
    });

    group.finish();

    let mut group = c.benchmark_group("understory_canvas");
    group.sample_size(50);

    for mode in [ApplyMode::Immediate, ApplyMode::Batched] {
        group.bench_function(format!("resize_recompute({mode:?},n=64)"), |b| {
            b.iter_batched(
                || {
                    let body = ResizeSignal::new();
                    let frame = SharedFrame::attached(framed);
                    let mut store = UiStore::new(UiState::default()).with_mode(mode);
                    let mut canvas = CanvasController::new(CanvasOptions::default());
                    canvas.mount(frame.clone(), &body, &mut store);
                    store.flush();
                    (body, frame, store, canvas)
                },
                |(body, frame, mut store, mut canvas)| {
                    let mut rng = Lcg::new(0xF17_0000_0000_0002);
                    for _ in 0..64 {
                        let width = 1.0 + rng.gen_px(2_048);
                        let height = 1.0 + rng.gen_px(1_536);
                        frame.set(BoxModel::new(Rect::new(0.0, 0.0, width, height)));
                        body.notify(Size::new(width, height));
                        canvas.sync(&mut store);
                        store.flush();
                    }
                    black_box(canvas.root_height());
                    black_box(store);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_zoom_config);
criterion_main!(benches);
