mod copy;
mod markers;
mod shift;
