mod seek;
