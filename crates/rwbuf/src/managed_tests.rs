// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::ramp;

/// Park the buffer, push data at it while parked, then restore `shape`.
fn cycle<M: Managed<Sample = f32>>(buffer: &M, shape: Shape) -> anyhow::Result<()> {
    buffer.park();
    assert_eq!(buffer.shape().rows(), 0);
    assert_eq!(buffer.shape().columns(), shape.columns());

    let data = ramp(4);
    buffer.write(BlockView::from(&data), false)?;
    assert!(buffer.is_empty());
    crate::assert_err_contains!(buffer.write(BlockView::from(&data), true), "not enough space");

    buffer.set_shape(shape.clone());
    assert_eq!(buffer.shape(), shape);
    Ok(())
}

#[test]
fn ring_parks_and_restores() -> anyhow::Result<()> {
    let buffer = SynchronizedRingBuffer::<f32>::with_capacity(8, 1);
    let data = ramp(3);
    buffer.write(&data, true)?;

    cycle(&buffer, Shape::new(8, 1))?;

    Managed::write(&buffer, BlockView::from(&data), true)?;
    assert_eq!(Managed::len(&buffer), 3);
    assert_eq!(Managed::read(&buffer, None)?.column(0), data);
    Ok(())
}

#[test]
fn framing_parks_and_restores() -> anyhow::Result<()> {
    let buffer = FramingBuffer::<f32>::with_rate(10.0, 1, 2.0, 0.0)?;
    cycle(&buffer, Shape::new(20, 1))?;
    assert_eq!(buffer.capacity(), 20);
    assert_eq!(buffer.seconds(), 2.0);

    let data = ramp(5);
    Managed::write(&buffer, BlockView::from(&data), true)?;
    assert_eq!(Managed::read(&buffer, Some(5))?.column(0), data);
    Ok(())
}

#[test]
fn managed_as_trait_object() -> anyhow::Result<()> {
    let buffers: Vec<Box<dyn Managed<Sample = f32>>> = vec![
        Box::new(SynchronizedRingBuffer::<f32>::with_capacity(4, 2)),
        Box::new(FramingBuffer::<f32>::from_shape(4, 2, 1.0)),
    ];
    for buffer in &buffers {
        buffer.park();
        assert_eq!(buffer.shape(), Shape::new(0, 2));
        buffer.set_shape(Shape::new(4, 2));
        assert_eq!(buffer.len(), 0);
    }
    Ok(())
}
