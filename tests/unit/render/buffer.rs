use super::*;

fn solid(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    px.repeat((w * h) as usize)
}

#[test]
fn new_buffer_is_transparent() {
    let buf = PixelBuffer::new(3, 2);
    assert_eq!(buf.as_bytes().len(), 24);
    assert!(buf.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn from_rgba8_rejects_length_mismatch() {
    assert!(PixelBuffer::from_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(PixelBuffer::from_rgba8(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn get_and_put_respect_bounds() {
    let mut buf = PixelBuffer::new(2, 2);
    buf.put(1, 1, [1, 2, 3, 4]);
    buf.put(2, 0, [9, 9, 9, 9]);
    buf.put(-1, 0, [9, 9, 9, 9]);
    assert_eq!(buf.get(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(buf.get(2, 0), None);
    assert_eq!(buf.get(0, -1), None);
    assert_eq!(buf.as_bytes().iter().filter(|&&b| b == 9).count(), 0);
}

#[test]
fn blit_replace_overwrites_including_alpha() {
    let mut buf = PixelBuffer::from_rgba8(2, 2, solid(2, 2, [255, 0, 0, 255])).unwrap();
    buf.blit_replace(0, 0, 1, 1, &[0, 0, 255, 10]).unwrap();
    assert_eq!(buf.get(0, 0), Some([0, 0, 255, 10]));
    assert_eq!(buf.get(1, 0), Some([255, 0, 0, 255]));
}

#[test]
fn blit_replace_clips_negative_and_overflowing_offsets() {
    let mut buf = PixelBuffer::new(3, 3);
    let mut src = Vec::new();
    for i in 0..4u8 {
        src.extend_from_slice(&[i, i, i, 255]);
    }
    buf.blit_replace(-1, -1, 2, 2, &src).unwrap();
    assert_eq!(buf.get(0, 0), Some([3, 3, 3, 255]));
    assert_eq!(buf.get(1, 0), Some([0, 0, 0, 0]));

    buf.blit_replace(2, 2, 2, 2, &src).unwrap();
    assert_eq!(buf.get(2, 2), Some([0, 0, 0, 255]));
}

#[test]
fn blit_replace_rejects_bad_source_length() {
    let mut buf = PixelBuffer::new(2, 2);
    assert!(buf.blit_replace(0, 0, 2, 2, &[0; 8]).is_err());
}

#[test]
fn clear_zeroes_everything() {
    let mut buf = PixelBuffer::from_rgba8(1, 2, solid(1, 2, [5, 6, 7, 8])).unwrap();
    buf.clear();
    assert!(buf.as_bytes().iter().all(|&b| b == 0));
}
